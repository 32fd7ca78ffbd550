// src/analyzer/login.rs
// =============================================================================
// Guesses whether the page contains a login form.
//
// Two signals, checked in a single scan:
// - a <form> whose name, id or action mentions login/signin/sign_in
//   -> login form, stop immediately
// - otherwise count password inputs: exactly one means a login form. Two or
//   more usually means a sign-up or password reset form.
// =============================================================================

use super::document::Document;
use super::scanner::Token;

const LOGIN_FORM_KEYWORDS: [&str; 3] = ["login", "signin", "sign_in"];
const FORM_IDENTITY_ATTRIBUTES: [&str; 3] = ["name", "id", "action"];

pub fn has_login_form(document: &Document) -> bool {
    let mut password_inputs = 0usize;

    for token in document.scanner().scan() {
        let Token::StartTag(tag) = token else {
            continue;
        };

        match tag.name.as_str() {
            "form" => {
                let named_login = tag
                    .attrs
                    .iter()
                    .filter(|(name, _)| FORM_IDENTITY_ATTRIBUTES.contains(&name.as_str()))
                    .any(|(_, value)| {
                        let value = value.to_lowercase();
                        LOGIN_FORM_KEYWORDS.iter().any(|k| value.contains(k))
                    });
                if named_login {
                    return true;
                }
            }
            "input" => {
                let is_password = tag
                    .attrs
                    .iter()
                    .any(|(name, value)| name == "type" && value.to_lowercase().contains("password"));
                if is_password {
                    password_inputs += 1;
                }
            }
            _ => {}
        }
    }

    password_inputs == 1
}
