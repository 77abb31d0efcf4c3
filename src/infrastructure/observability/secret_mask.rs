const VISIBLE_EDGE: usize = 4;

/// Masks a credential for logging, keeping only the first and last few characters.
pub fn mask_secret(secret: &str) -> String {
    let trimmed = secret.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= VISIBLE_EDGE * 2 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..VISIBLE_EDGE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE_EDGE..].iter().collect();
    format!("{}****{}", head, tail)
}
