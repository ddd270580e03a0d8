// File: src/controllers.rs
// Purpose: Demo controllers wired into the reference server

use anyhow::Result;
use corvid::model::ModelBindingError;
use corvid::{
    async_trait, Controller, ControllerContext, ControllerEntry, ControllerResponse, Method,
    Model, PropertyRules, RedirectTarget, RegistryBuilder, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Register routes, controllers and error pages
pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .global(ControllerEntry::new("NavBar", || NavBar))
        .controller("index", ControllerEntry::new("Home", || Home))
        .controller("users", ControllerEntry::new("UserDetails", || UserDetails))
        .controller(
            "contact",
            ControllerEntry::new("ContactForm", || ContactForm).methods([Method::GET]),
        )
        .controller(
            "contact",
            ControllerEntry::new("ContactSubmit", || ContactSubmit).methods([Method::POST]),
        )
        .controller("api/status", ControllerEntry::new("Status", || Status))
        .controller("not-found", ControllerEntry::new("NotFound", || NotFound))
        .route("/users/{id}", "users")
        .http_error(StatusCode::NOT_FOUND, "not-found")
}

/// Site navigation, present on every page
pub struct NavBar;

#[async_trait]
impl Controller for NavBar {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        let nav = format!(
            r#"<a href="/">{}</a> <a href="/contact">{}</a>"#,
            ctx.string("NavHome"),
            ctx.string("NavContact")
        );
        ctx.data.set("NavBar", nav);
        Ok(ControllerResponse::Continue)
    }
}

pub struct Home;

#[async_trait]
impl Controller for Home {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        Ok(ControllerResponse::tpl_with_title(
            format!("<h1>{}</h1>", ctx.string("Welcome")),
            ctx.string("HomeTitle"),
        ))
    }
}

pub struct UserDetails;

#[async_trait]
impl Controller for UserDetails {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        let Some(id) = ctx.request.route_params.get_as::<u32>("id") else {
            return Ok(ControllerResponse::Http404);
        };

        Ok(ControllerResponse::tpl_with_title(
            format!("<h1>User {}</h1>", id),
            format!("User {}", id),
        ))
    }
}

/// Contact form submission
#[derive(Debug, Deserialize, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Model for ContactMessage {
    fn rules() -> Vec<PropertyRules> {
        vec![
            PropertyRules::new("name").required().max_length(50),
            PropertyRules::new("email").required().email(),
            PropertyRules::new("message").required().min_length(10).max_length(2000),
        ]
    }
}

pub struct ContactForm;

#[async_trait]
impl Controller for ContactForm {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        Ok(ControllerResponse::StaticTpl {
            template: "Contact".to_string(),
            title: Some(ctx.string("ContactTitle")),
        })
    }
}

pub struct ContactSubmit;

#[async_trait]
impl Controller for ContactSubmit {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        match ctx.model::<ContactMessage>() {
            Ok(message) => {
                tracing::info!(from = %message.email, "contact message received");
                Ok(ControllerResponse::Redirect(RedirectTarget::DefaultPage))
            }
            Err(ModelBindingError::Constraint { property, .. }) => {
                ctx.response.set_status(StatusCode::BAD_REQUEST);
                Ok(ControllerResponse::tpl_with_title(
                    format!(
                        r#"<p class="error">{}: {}</p>"#,
                        ctx.string("InvalidField"),
                        property
                    ),
                    ctx.string("ContactTitle"),
                ))
            }
            Err(e) => {
                tracing::debug!("contact form rejected: {}", e);
                Ok(ControllerResponse::Http400)
            }
        }
    }
}

/// Health endpoint answering with raw JSON
pub struct Status;

#[async_trait]
impl Controller for Status {
    async fn invoke(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        Ok(ControllerResponse::Json(json!({ "status": "ok" })))
    }
}

pub struct NotFound;

#[async_trait]
impl Controller for NotFound {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
        let content = format!("<h1>{}</h1>", ctx.string("PageNotFound"));
        Ok(ControllerResponse::tpl_with_title(content, ctx.string("PageNotFound")))
    }
}
