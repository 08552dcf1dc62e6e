/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Maps the signed-in user's claims and an operation result onto a [`ViewModel`].

use photolibrary_types::ViewModel;
use serde_json::Value;

use crate::principal::Principal;

/// Picture shown when the identity provider does not supply one.
pub const DEFAULT_PICTURE: &str = "/static/images/person.svg";

/// Builds the values every view starts from.
#[derive(Debug, Clone)]
pub struct ViewAssembler {
    authorizer: String,
}

impl ViewAssembler {
    pub fn new(authorizer: impl Into<String>) -> Self {
        Self {
            authorizer: authorizer.into(),
        }
    }

    /// Assemble `view` for `principal`, optionally carrying `payload` as
    /// `(field, value)`. Missing claims become `null`.
    pub fn assemble(
        &self,
        view: &str,
        principal: &Principal,
        payload: Option<(&str, Value)>,
    ) -> ViewModel {
        let claim = |name: &str| principal.attribute(name).cloned().unwrap_or(Value::Null);

        let picture = principal
            .attribute("picture")
            .cloned()
            .unwrap_or_else(|| Value::String(DEFAULT_PICTURE.to_string()));

        let mut model = ViewModel::new(view)
            .with("authorizer", Value::String(self.authorizer.clone()))
            .with("firstName", claim("given_name"))
            .with("lastName", claim("family_name"))
            .with("email", claim("email"))
            .with("picture", picture);

        if let Some((field, value)) = payload {
            model.insert(field, value);
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use photolibrary_types::view::{ALBUM_LISTING_VIEW, WELCOME_VIEW};
    use serde_json::{json, Map};

    use super::*;

    fn principal(claims: Value) -> Principal {
        let attrs: Map<String, Value> = serde_json::from_value(claims).unwrap();
        Principal::new("sub-1", attrs)
    }

    #[test]
    fn picture_defaults_to_placeholder() {
        let assembler = ViewAssembler::new("Google");
        let view = assembler.assemble(WELCOME_VIEW, &principal(json!({})), None);
        assert_eq!(view.get("picture"), Some(&json!(DEFAULT_PICTURE)));
    }

    #[test]
    fn null_picture_also_defaults() {
        let assembler = ViewAssembler::new("Google");
        let view = assembler.assemble(WELCOME_VIEW, &principal(json!({ "picture": null })), None);
        assert_eq!(view.get("picture"), Some(&json!(DEFAULT_PICTURE)));
    }

    #[test]
    fn picture_claim_is_passed_through_unmodified() {
        let url = "https://lh3.googleusercontent.com/a/photo=s96-c?x=1&y=2";
        let assembler = ViewAssembler::new("Google");
        let view = assembler.assemble(WELCOME_VIEW, &principal(json!({ "picture": url })), None);
        assert_eq!(view.get("picture"), Some(&json!(url)));
    }

    #[test]
    fn claims_map_to_named_fields() {
        let assembler = ViewAssembler::new("Keycloak");
        let view = assembler.assemble(
            WELCOME_VIEW,
            &principal(json!({
                "given_name": "Ada",
                "family_name": "Lovelace",
                "email": "ada@example.com"
            })),
            None,
        );

        assert_eq!(view.view, WELCOME_VIEW);
        assert_eq!(view.get("authorizer"), Some(&json!("Keycloak")));
        assert_eq!(view.get("firstName"), Some(&json!("Ada")));
        assert_eq!(view.get("lastName"), Some(&json!("Lovelace")));
        assert_eq!(view.get("email"), Some(&json!("ada@example.com")));
        assert!(view.get("albums").is_none());
        assert!(view.get("photos").is_none());
    }

    #[test]
    fn absent_claims_are_null_not_errors() {
        let assembler = ViewAssembler::new("Google");
        let view = assembler.assemble(WELCOME_VIEW, &principal(json!({})), None);
        assert_eq!(view.get("firstName"), Some(&Value::Null));
        assert_eq!(view.get("lastName"), Some(&Value::Null));
        assert_eq!(view.get("email"), Some(&Value::Null));
    }

    #[test]
    fn payload_lands_under_its_field() {
        let assembler = ViewAssembler::new("Google");
        let view = assembler.assemble(
            ALBUM_LISTING_VIEW,
            &principal(json!({})),
            Some(("albums", json!([{ "id": "1" }]))),
        );
        assert_eq!(view.get("albums"), Some(&json!([{ "id": "1" }])));
    }
}
