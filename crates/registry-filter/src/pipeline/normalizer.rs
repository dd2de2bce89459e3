pub(crate) const BASE_ID_WIDTH: usize = 8;
pub(crate) const STATUS_WIDTH: usize = 2;
pub(crate) const CLASSIFICATION_CODE_WIDTH: usize = 7;

/// Left-pads with `0` up to `width` characters. Longer values are kept as is.
pub(crate) fn zero_pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let mut padded = String::with_capacity(width);
    padded.extend(std::iter::repeat('0').take(width - len));
    padded.push_str(value);
    padded
}

pub(crate) fn normalize_base_id(value: &str) -> String {
    zero_pad(value.trim(), BASE_ID_WIDTH)
}

pub(crate) fn normalize_status(value: &str) -> String {
    zero_pad(value.trim(), STATUS_WIDTH)
}

/// Some file vintages pack secondary codes into the primary cell
/// (`"1061902,4639701"`); only the first token is the primary code.
pub(crate) fn normalize_classification_code(value: &str) -> String {
    let first = value.split(',').next().unwrap_or_default();
    let digits: String = first.chars().filter(char::is_ascii_digit).collect();
    zero_pad(&digits, CLASSIFICATION_CODE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_id_is_trimmed_and_padded() {
        assert_eq!(normalize_base_id(" 123 "), "00000123");
        assert_eq!(normalize_base_id("12345678"), "12345678");
        assert_eq!(normalize_base_id(""), "00000000");
        assert_eq!(normalize_base_id("123456789"), "123456789");
    }

    #[test]
    fn status_is_padded_to_two_characters() {
        assert_eq!(normalize_status("2"), "02");
        assert_eq!(normalize_status(" 02"), "02");
        assert_eq!(normalize_status("8"), "08");
        assert_eq!(normalize_status(""), "00");
    }

    #[test]
    fn classification_code_uses_first_token_and_digits_only() {
        assert_eq!(normalize_classification_code("1061902,9999999"), "1061902");
        assert_eq!(normalize_classification_code("1061-9/02"), "1061902");
        assert_eq!(normalize_classification_code("113000"), "0113000");
        assert_eq!(normalize_classification_code(",1061902"), "0000000");
        assert_eq!(normalize_classification_code(""), "0000000");
    }

    #[test]
    fn zero_pad_counts_characters_not_bytes() {
        assert_eq!(zero_pad("ã", 3), "00ã");
    }
}
