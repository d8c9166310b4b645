/// Unit tests for RegistryError and RegistryResult types

use component_registry::{ComponentKey, RegistryError, RegistryResult, Scope};
use std::error::Error;

fn key(name: &str) -> ComponentKey {
    ComponentKey::new(name)
}

#[test]
fn test_error_display_unknown() {
    let error = RegistryError::UnknownComponent(key("Editor"));
    assert_eq!(error.to_string(), "Unknown component: editor");
}

#[test]
fn test_error_display_ambiguous() {
    let error = RegistryError::AmbiguousComponent {
        key: key("Panel"),
        candidates: vec![key("Output"), key("Terminal")],
    };
    assert_eq!(
        error.to_string(),
        "Ambiguous component: panel has 2 implementations (output, terminal)"
    );
}

#[test]
fn test_error_display_scope_transition() {
    let error = RegistryError::InvalidScopeTransition {
        key: key("Session"),
        from: Scope::Singleton,
        to: Scope::Prototype,
    };
    let display = error.to_string();
    assert!(display.contains("session"));
    assert!(display.contains("from Singleton to Prototype"));
}

#[test]
fn test_error_display_remaining_variants() {
    let cases = vec![
        (RegistryError::DuplicateComponent(key("A")), "Component already registered: a"),
        (
            RegistryError::InvalidDeclaration { key: key("A"), reason: "bad chain".into() },
            "Invalid declaration for a: bad chain",
        ),
        (
            RegistryError::TypeMismatch { key: key("A"), expected: "dyn Widget" },
            "Type mismatch: a does not provide dyn Widget",
        ),
        (
            RegistryError::MissingArgument { index: 2, len: 1 },
            "Missing argument: index 2 requested, 1 resolved",
        ),
        (RegistryError::DepthExceeded(1024), "Max depth 1024 exceeded"),
        (RegistryError::component_failed("A", "boom"), "Component a failed: boom"),
        (RegistryError::ContextShutDown, "Application context has been shut down"),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_error_key() {
    assert_eq!(RegistryError::DuplicateComponent(key("A")).key(), Some(&key("a")));
    assert_eq!(RegistryError::DepthExceeded(3).key(), None);
    assert_eq!(RegistryError::ContextShutDown.key(), None);
}

#[test]
fn test_error_trait_and_result_alias() {
    fn fails() -> RegistryResult<()> {
        Err(RegistryError::UnknownComponent(key("x")))
    }

    let error = fails().unwrap_err();
    let boxed: Box<dyn Error> = Box::new(error.clone());
    assert!(boxed.source().is_none());
    assert_eq!(boxed.to_string(), error.to_string());
}
