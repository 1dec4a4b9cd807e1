//! Contact list lines → client records.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::CreateClientRequest;

static CHAT_CONTACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)[\s\-:]+(\+?\d{10,15})").expect("valid regex"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\+?\d{10,15})").expect("valid regex"));
static PHONE_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-()]").expect("valid regex"));

const DEFAULT_CONTACT_NAME: &str = "Cliente";

/// Tries, in order: `name,phone[,email]`, `Name - +549...` / `Name: ...`,
/// then any line containing a phone number.
pub fn parse_contact_line(line: &str) -> Option<CreateClientRequest> {
    if line.contains(',') {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() >= 2 {
            let name = parts[0];
            let phone = normalize_phone(parts[1]);
            let email = parts.get(2).map(|e| e.to_string());

            if !name.is_empty() && !phone.is_empty() {
                return Some(contact(name, phone, email));
            }
        }
    }

    if let Some(caps) = CHAT_CONTACT.captures(line) {
        return Some(contact(
            caps[1].trim(),
            normalize_phone(caps[2].trim()),
            None,
        ));
    }

    if let Some(found) = PHONE.find(line) {
        let phone = normalize_phone(found.as_str());
        let rest = PHONE.replace(line, "");
        let name = match rest.trim() {
            "" => DEFAULT_CONTACT_NAME,
            name => name,
        };
        return Some(contact(name, phone, None));
    }

    None
}

/// Drops separators; bare 10-digit local numbers get the Argentine prefix.
pub fn normalize_phone(phone: &str) -> String {
    let normalized = PHONE_NOISE.replace_all(phone, "").into_owned();

    if normalized.starts_with('+') || normalized.len() != 10 {
        return normalized;
    }

    if normalized.starts_with('9') {
        format!("+54{}", normalized)
    } else {
        format!("+549{}", normalized)
    }
}

fn contact(name: &str, phone: String, email: Option<String>) -> CreateClientRequest {
    CreateClientRequest {
        name: name.to_string(),
        phone,
        email,
        rubro: None,
        company: None,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_line_with_email() {
        let parsed = parse_contact_line("Clínica San Martín, 11 3344-5566, compras@csm.com.ar").unwrap();

        assert_eq!(parsed.name, "Clínica San Martín");
        assert_eq!(parsed.phone, "+5491133445566");
        assert_eq!(parsed.email.as_deref(), Some("compras@csm.com.ar"));
    }

    #[test]
    fn parses_chat_export_line() {
        let parsed = parse_contact_line("Hospital del Sur - +5491144221133").unwrap();

        assert_eq!(parsed.name, "Hospital del Sur");
        assert_eq!(parsed.phone, "+5491144221133");
        assert_eq!(parsed.email, None);
    }

    #[test]
    fn parses_colon_separated_line() {
        let parsed = parse_contact_line("Dra. Pérez: 1155667788").unwrap();

        assert_eq!(parsed.name, "Dra. Pérez");
        assert_eq!(parsed.phone, "+5491155667788");
    }

    #[test]
    fn bare_phone_gets_default_name() {
        let parsed = parse_contact_line("+5491122334455").unwrap();

        assert_eq!(parsed.name, "Cliente");
        assert_eq!(parsed.phone, "+5491122334455");
    }

    #[test]
    fn lines_without_phone_are_rejected() {
        assert!(parse_contact_line("sin datos de contacto").is_none());
        assert!(parse_contact_line("Juan, ").is_none());
    }

    #[test]
    fn normalizes_local_numbers() {
        assert_eq!(normalize_phone("911 2233-445"), "+549112233445");
        assert_eq!(normalize_phone("(11) 2233-4455"), "+5491122334455");
        assert_eq!(normalize_phone("+54 9 11 2233-4455"), "+5491122334455");
        assert_eq!(normalize_phone("12345"), "12345");
    }
}
