//! Integration tests for corvid-router
//!
//! Covers registration-order matching, segment-count rules, parameter
//! extraction and the path-parser fallback.

use corvid_router::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn matcher() -> RouteMatcher {
    RouteMatcher::new()
        .with_route(Route::new("/users/new", "users/new").unwrap())
        .with_route(Route::new("/users/{id}", "users").unwrap())
        .with_route(Route::new("/users/{id}/posts/{post}", "posts").unwrap())
        .with_route(Route::new("/blog/:slug", "blog").unwrap())
}

#[test]
fn test_users_id_extracts_param() {
    let found = matcher().match_path("/users/42").unwrap();
    assert_eq!(found.controller, ControllerId::new("users"));
    assert_eq!(found.pattern, "/users/{id}");
    assert_eq!(found.params.get("id"), Some("42"));
}

#[test]
fn test_first_registered_wins() {
    let found = matcher().match_path("/users/new").unwrap();
    assert_eq!(found.controller.as_str(), "users/new");
    assert!(found.params.is_empty());

    // Same paths, reversed registration: the parameter route now wins.
    let reversed = RouteMatcher::new()
        .with_route(Route::new("/users/{id}", "users").unwrap())
        .with_route(Route::new("/users/new", "users/new").unwrap());
    let found = reversed.match_path("/users/new").unwrap();
    assert_eq!(found.controller.as_str(), "users");
    assert_eq!(found.params.get("id"), Some("new"));
}

#[test]
fn test_multiple_params_in_order() {
    let found = matcher().match_path("/users/7/posts/99").unwrap();
    assert_eq!(found.controller.as_str(), "posts");
    let params: Vec<_> = found.params.iter().collect();
    assert_eq!(params, vec![("id", "7"), ("post", "99")]);
}

#[test]
fn test_colon_params() {
    let found = matcher().match_path("/blog/hello-world").unwrap();
    assert_eq!(found.params.get("slug"), Some("hello-world"));
}

#[rstest]
#[case("/users")]
#[case("/users/42/posts")]
#[case("/users/42/posts/1/extra")]
#[case("/blog")]
#[case("/unknown/path")]
fn test_segment_count_mismatch_never_matches(#[case] path: &str) {
    assert!(matcher().match_path(path).is_none());
}

#[rstest]
#[case("/users/42/", Some("42"))]
#[case("//users//42", Some("42"))]
#[case("\\users\\42", Some("42"))]
fn test_malformed_paths_are_normalized(#[case] path: &str, #[case] id: Option<&str>) {
    let found = matcher().match_path(path).unwrap();
    assert_eq!(found.params.get("id"), id);
}

#[test]
fn test_case_sensitivity() {
    let sensitive = matcher();
    assert!(sensitive.match_path("/Users/42").is_none());

    let insensitive = matcher().with_case_insensitive(true);
    let found = insensitive.match_path("/Users/42").unwrap();
    assert_eq!(found.controller.as_str(), "users");
    // Parameter values keep their original casing
    let found = insensitive.match_path("/BLOG/Hello").unwrap();
    assert_eq!(found.params.get("slug"), Some("Hello"));
}

#[test]
fn test_invalid_patterns_are_rejected() {
    assert!(matches!(
        Route::new("/x/{}", "x"),
        Err(PatternError::EmptyParamName { .. })
    ));
    assert!(matches!(
        Route::new("/x/{a}/{a}", "x"),
        Err(PatternError::DuplicateParam { .. })
    ));
}

#[test]
fn test_root_falls_back_to_index() {
    let empty = RouteMatcher::new();
    assert!(empty.match_path("/").is_none());
    assert_eq!(ControllerPathParser::new().parse("/").as_str(), INDEX_CONTROLLER);
}

#[test]
fn test_fallback_identifier_for_unmatched_path() {
    let path = "/admin/settings/";
    assert!(matcher().match_path(path).is_none());
    assert_eq!(
        ControllerPathParser::new().parse(path),
        ControllerId::new("admin/settings")
    );
}
