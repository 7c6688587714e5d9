//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::product::ProductPayload;

const MIN_PASSWORD_LEN: usize = 5;
const MAX_PASSWORD_LEN: usize = 15;
const SUBSCRIBER_NUMBER_LEN: usize = 10;
const MAX_NAME_LEN: usize = 30;
const MAX_SKU_LEN: usize = 30;
const MAX_NOTES_LEN: usize = 200;
const MAX_LOCATION_LEN: usize = 200;
const MAX_STOCK: i32 = 100_000;

/// International dialling codes accepted in phone numbers
const COUNTRY_CODES: &[&str] = &[
    "1", "7", "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44", "45",
    "46", "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61", "62", "63",
    "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95", "98", "211",
    "212", "213", "216", "218", "220", "221", "222", "223", "224", "225", "226", "227", "228",
    "229", "230", "231", "232", "233", "234", "235", "236", "237", "238", "239", "240", "241",
    "242", "243", "244", "245", "246", "248", "249", "250", "251", "252", "253", "254", "255",
    "256", "257", "258", "260", "261", "262", "263", "264", "265", "266", "267", "268", "269",
    "290", "291", "297", "298", "299", "350", "351", "352", "353", "354", "355", "356", "357",
    "358", "359", "370", "371", "372", "373", "374", "375", "376", "377", "378", "379", "380",
    "381", "382", "383", "385", "386", "387", "389", "420", "421", "423", "500", "501", "502",
    "503", "504", "505", "506", "507", "508", "509", "590", "591", "592", "593", "595", "597",
    "598", "599", "670", "672", "673", "674", "675", "676", "677", "678", "679", "680", "681",
    "682", "683", "685", "686", "687", "688", "689", "690", "691", "692", "850", "852", "853",
    "855", "856", "880", "886", "960", "961", "962", "963", "964", "965", "966", "967", "968",
    "970", "971", "972", "973", "974", "975", "976", "977", "992", "993", "994", "995", "996",
    "998", "1-242", "1-246", "1-264", "1-268", "1-284", "1-340", "1-345", "1-441", "1-473",
    "1-649", "1-664", "1-670", "1-671", "1-684", "1-721", "1-758", "1-767", "1-784", "1-787",
    "1-809", "1-829", "1-849", "1-868", "1-869", "1-876", "1-939", "44-1481", "44-1534",
    "44-1624",
];

/// Validate a staff member's full name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z\s]{5,15}$").expect("Failed to compile name regex"));

    if !regex.is_match(name) {
        return Err("Name must be 5 to 15 letters or spaces".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(format!(
            "Password must be {} to {} characters long",
            MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
        ));
    }

    if !password.chars().any(char::is_alphanumeric) {
        return Err("Password must contain a letter or a digit".to_string());
    }

    Ok(())
}

/// Validate an international phone number such as `+6281234567890`
pub fn validate_phone_number(phone_number: &str) -> Result<(), String> {
    let digits = phone_number
        .strip_prefix('+')
        .ok_or_else(|| "Phone number must start with +".to_string())?;

    if !digits.is_ascii() || digits.len() <= SUBSCRIBER_NUMBER_LEN {
        return Err("Invalid phone number".to_string());
    }

    let (country_code, subscriber) = digits.split_at(digits.len() - SUBSCRIBER_NUMBER_LEN);

    if !COUNTRY_CODES.contains(&country_code) {
        return Err("Unknown country code".to_string());
    }

    if !subscriber.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Phone number must end with 10 digits".to_string());
    }

    Ok(())
}

fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.chars().count() > max_len {
        return Err(format!("{} must be at most {} characters long", field, max_len));
    }

    Ok(())
}

/// Validate a product create/update payload
pub fn validate_product(payload: &ProductPayload) -> Result<(), String> {
    validate_text("name", &payload.name, MAX_NAME_LEN)?;
    validate_text("sku", &payload.sku, MAX_SKU_LEN)?;
    validate_text("notes", &payload.notes, MAX_NOTES_LEN)?;
    validate_text("location", &payload.location, MAX_LOCATION_LEN)?;

    if payload.image_url.is_empty() {
        return Err("imageUrl is required".to_string());
    }

    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("Failed to compile url regex")
    });

    if !regex.is_match(&payload.image_url) {
        return Err("imageUrl must be a valid URL".to_string());
    }

    if !payload.price.is_finite() || payload.price <= 0.0 {
        return Err("price must be greater than 0".to_string());
    }

    if !(0..=MAX_STOCK).contains(&payload.stock) {
        return Err(format!("stock must be between 0 and {}", MAX_STOCK));
    }

    Ok(())
}
