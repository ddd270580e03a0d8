// Corvid - controller dispatch pipeline
// Routes requests to controller chains, binds models, builds master pages

// Request and response
pub mod request_context;
pub mod response;
pub mod config;

// Collaborators
pub mod data_collector;
pub mod template;
pub mod string_table;
pub mod redirect;
pub mod model;

// Pipeline
pub mod controller;
pub mod registry;
pub mod executor;
pub mod processor;
pub mod controllers_handler;
pub mod page;
pub mod page_data;
pub mod request_handler;

// Re-export pipeline types
pub use controller::{Controller, ControllerContext, ControllerResponse, HttpError, Services};
pub use controllers_handler::{ControllersHandler, ControllersRequestHandler};
pub use executor::{ControllerExecutor, ControllerOutcome};
pub use page::{HtmlPageProcessor, PageBuilder, PageProcessor};
pub use page_data::{ContextVariablesSetter, PageDataSetter, StringTableItemsSetter};
pub use processor::{ControllersProcessor, ControllersProcessorResult};
pub use registry::{
    ControllerDescriptor, ControllerEntry, ControllerFactory, ControllerRegistry,
    RegistryBuilder, RegistryError, SecurityRule,
};
pub use request_handler::RequestHandler;

// Re-export collaborators
pub use config::Config;
pub use data_collector::DataCollector;
pub use model::{Model, ModelBindingError, ModelHandler, PropertyRules};
pub use redirect::{DefaultRedirector, RedirectTarget, Redirector};
pub use request_context::{FormData, Principal, QueryParams, RequestContext};
pub use response::HttpResponse;
pub use string_table::{MapStringTable, StringTable};
pub use template::{FileTemplateFactory, MemoryTemplateFactory, Template, TemplateFactory};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;
pub use axum::http::{Method, StatusCode};
pub use corvid_router::{ControllerId, Params};
