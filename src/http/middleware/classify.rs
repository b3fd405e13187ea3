//! Tags requests as authentication attempts or CRUD mutations.
//!
//! Two strategies are supported:
//! - `Declared`: the route table states the intent of each
//!   (method, route template) pair
//! - `PathSubstring`: marker words anywhere in the raw path, as older
//!   deployments did. `/blog/recreate` counts as a create here

use axum::http::Method;

use crate::config::RouteClassification;

const AUTH_MARKERS: [&str; 2] = ["login", "register"];
const CRUD_MARKERS: [&str; 4] = ["create", "update", "delete", "edit"];

/// What the auth and CRUD taggers know about a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteTags {
    /// `login` or `register`.
    pub auth: Option<&'static str>,
    /// `create`, `update`, `delete` or `edit`.
    pub crud: Option<&'static str>,
}

impl RouteTags {
    pub const fn auth(action: &'static str) -> Self {
        Self {
            auth: Some(action),
            crud: None,
        }
    }

    pub const fn crud(operation: &'static str) -> Self {
        Self {
            auth: None,
            crud: Some(operation),
        }
    }
}

/// Lookup of declared intents by method and route template.
pub type DeclaredTags = fn(&Method, &str) -> RouteTags;

#[derive(Clone, Copy)]
pub struct RouteClassifier {
    mode: RouteClassification,
    declared: DeclaredTags,
}

impl RouteClassifier {
    pub fn new(mode: RouteClassification, declared: DeclaredTags) -> Self {
        Self { mode, declared }
    }

    /// `route` is the matched template, absent for unrouted requests.
    pub fn classify(&self, method: &Method, path: &str, route: Option<&str>) -> RouteTags {
        match self.mode {
            RouteClassification::Declared => route
                .map(|route| (self.declared)(method, route))
                .unwrap_or_default(),
            RouteClassification::PathSubstring => RouteTags {
                auth: first_marker(path, &AUTH_MARKERS),
                crud: first_marker(path, &CRUD_MARKERS),
            },
        }
    }
}

fn first_marker(path: &str, markers: &[&'static str]) -> Option<&'static str> {
    markers.iter().copied().find(|marker| path.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(method: &Method, route: &str) -> RouteTags {
        match (method.as_str(), route) {
            ("POST", "/blog/login") => RouteTags::auth("login"),
            ("PUT", "/blog/{id}") => RouteTags::crud("update"),
            _ => RouteTags::default(),
        }
    }

    #[test]
    fn test_declared_uses_route_template() {
        let classifier = RouteClassifier::new(RouteClassification::Declared, declared);

        let tags = classifier.classify(&Method::PUT, "/blog/7", Some("/blog/{id}"));
        assert_eq!(tags, RouteTags::crud("update"));

        // A path that merely contains a marker word is not tagged.
        let tags = classifier.classify(&Method::GET, "/blog/recreate", Some("/blog/{id}"));
        assert_eq!(tags, RouteTags::default());

        let tags = classifier.classify(&Method::POST, "/blog/login", None);
        assert_eq!(tags, RouteTags::default());
    }

    #[test]
    fn test_substring_matches_anywhere() {
        let classifier = RouteClassifier::new(RouteClassification::PathSubstring, declared);

        assert_eq!(
            classifier.classify(&Method::GET, "/blog/recreate", None),
            RouteTags::crud("create")
        );
        assert_eq!(
            classifier.classify(&Method::POST, "/blog/register", Some("/blog/register")),
            RouteTags::auth("register")
        );
        assert_eq!(
            classifier.classify(&Method::PUT, "/blog/7", Some("/blog/{id}")),
            RouteTags::default()
        );

        let both = classifier.classify(&Method::POST, "/login/edit", None);
        assert_eq!(both.auth, Some("login"));
        assert_eq!(both.crud, Some("edit"));
    }
}
