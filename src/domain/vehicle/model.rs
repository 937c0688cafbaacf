/// Registered vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i32,
    /// Normalized plate, see [`normalize_plate`]
    pub number: String,
    pub color: Option<String>,
    pub model: Option<String>,
    pub is_banned: bool,
    /// Owning account; `None` for unregistered plates
    pub account_id: Option<String>,
}

/// Normalize a plate as read by a camera or typed by an operator.
///
/// Keeps letters and digits, upper-cased. Returns `None` when nothing
/// usable remains.
pub fn normalize_plate(raw: &str) -> Option<String> {
    let plate: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect();

    if plate.is_empty() {
        None
    } else {
        Some(plate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_uppercases() {
        assert_eq!(normalize_plate(" aa 1234-bb\n").as_deref(), Some("AA1234BB"));
    }

    #[test]
    fn keeps_non_latin_letters() {
        assert_eq!(normalize_plate("аа1234вв").as_deref(), Some("АА1234ВВ"));
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(normalize_plate(" - \t"), None);
        assert_eq!(normalize_plate(""), None);
    }
}
