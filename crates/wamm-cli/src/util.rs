use crate::error::{invalid_input, not_found};
use anyhow::{Context as _, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use wamm_core::Contact;

/// Parses `NAME=PHONE` as given to `--to`.
pub fn parse_contact_spec(raw: &str) -> Result<Contact> {
    let (name, phone) = raw
        .rsplit_once('=')
        .ok_or_else(|| invalid_input(format!("expected NAME=PHONE, got {raw:?}")))?;
    Ok(Contact::new(name.trim(), phone.trim()))
}

/// Reads contacts from a JSON array of `{name, phone}` objects or from
/// `name,phone` lines. Blank lines, `#` comments and a `name,phone` header
/// are skipped.
pub fn load_contacts_file(path: &Path) -> Result<Vec<Contact>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(not_found(format!("contacts file {}", path.display())));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read contacts file {}", path.display()));
        }
    };
    parse_contacts(&data).with_context(|| format!("parse contacts file {}", path.display()))
}

pub fn parse_contacts(data: &str) -> Result<Vec<Contact>> {
    let data = data.trim_start_matches('\u{feff}');
    if data.trim_start().starts_with('[') {
        return serde_json::from_str(data)
            .map_err(|err| invalid_input(format!("invalid contacts json: {err}")));
    }

    let mut contacts = Vec::new();
    for (index, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, phone) = line.rsplit_once(',').ok_or_else(|| {
            invalid_input(format!("line {}: expected name,phone", index + 1))
        })?;
        let (name, phone) = (unquote(name), unquote(phone));
        if contacts.is_empty()
            && name.eq_ignore_ascii_case("name")
            && phone.eq_ignore_ascii_case("phone")
        {
            continue;
        }
        contacts.push(Contact::new(name, phone));
    }
    Ok(contacts)
}

pub fn read_message(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    let message = match (inline, file) {
        (Some(message), None) => message,
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("read message file {}", path.display()))?,
        (Some(_), Some(_)) => {
            return Err(invalid_input("use either --message or --message-file"));
        }
        (None, None) => return Err(invalid_input("a message is required")),
    };
    if message.trim().is_empty() {
        return Err(invalid_input("message cannot be empty"));
    }
    Ok(message)
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::{parse_contact_spec, parse_contacts, read_message};

    #[test]
    fn parse_contact_spec_splits_on_last_equals() {
        let contact = parse_contact_spec("Ada = Lovelace=+55 11 99999-9999").expect("contact");
        assert_eq!(contact.name, "Ada = Lovelace");
        assert_eq!(contact.phone, "+55 11 99999-9999");
        assert!(parse_contact_spec("Ada").is_err());
    }

    #[test]
    fn parse_contacts_reads_json() {
        let contacts = parse_contacts(
            r#"[{"name":"João Silva","phone":"+5511999999999"},{"name":"Maria","phone":"11888888888"}]"#,
        )
        .expect("contacts");
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "João Silva");
    }

    #[test]
    fn parse_contacts_reads_lines_with_header_and_comments() {
        let data = "name,phone\n# clientes ativos\n\"Silva, João\",+5511999999999\n\nMaria,(11) 8888-8888\n";
        let contacts = parse_contacts(data).expect("contacts");
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Silva, João");
        assert_eq!(contacts[1].phone, "(11) 8888-8888");
    }

    #[test]
    fn parse_contacts_rejects_lines_without_phone() {
        let err = parse_contacts("Ada\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn parse_contacts_counts_leading_blank_lines() {
        let err = parse_contacts("\n\nname,phone\nAda,1199\nbroken\n").unwrap_err();
        assert!(err.to_string().contains("line 5"), "{err}");
    }

    #[test]
    fn read_message_requires_exactly_one_source() {
        assert!(read_message(None, None).is_err());
        assert!(read_message(Some("  ".to_string()), None).is_err());
        assert_eq!(read_message(Some("oi".to_string()), None).expect("msg"), "oi");
    }
}
