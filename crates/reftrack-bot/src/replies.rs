//! User-facing message texts.

/// Reply to `/ping`.
pub const PONG: &str = "pong";

/// Shown when the platform refuses to create an invite link.
pub const LINK_FAILED: &str = "Havola yaratib bo'lmadi. Keyinroq urinib ko'ring.";

/// Used when the joining user has no first name.
pub const ANONYMOUS_USER: &str = "Foydalanuvchi";

/// Reply carrying a freshly issued link.
pub fn link_issued(link: &str) -> String {
    format!("🔗 Sizning guruh havolangiz:\n{}", link)
}

/// Referral count reply; HTML.
pub fn referral_count(count: usize) -> String {
    format!("<b>Sizning odamlaringiz</b>: <b>{}</b>", count)
}

/// Congratulation sent to a referrer; plain text.
pub fn referral_joined(first_name: &str) -> String {
    let name = if first_name.trim().is_empty() {
        ANONYMOUS_USER
    } else {
        first_name
    };
    format!("🎉 {} guruhga qo'shildi!", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_falls_back_for_blank_names() {
        assert_eq!(referral_joined(""), "🎉 Foydalanuvchi guruhga qo'shildi!");
        assert_eq!(referral_joined("Ann"), "🎉 Ann guruhga qo'shildi!");
    }

    #[test]
    fn count_is_bold() {
        assert_eq!(referral_count(3), "<b>Sizning odamlaringiz</b>: <b>3</b>");
    }
}
