use std::time::Duration;

pub const PLAYER_NAME_MAX_CHARS: usize = 10;

pub fn clamp_player_name(name: &str) -> String {
    name.trim()
        .chars()
        .take(PLAYER_NAME_MAX_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

pub fn format_seconds(time: Duration, decimals: usize) -> String {
    format!("{:.*}", decimals, time.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_player_name() {
        assert_eq!(clamp_player_name("  mina "), "mina");
        assert_eq!(clamp_player_name("김민수김민수김민수김민수"), "김민수김민수김민수김");
        assert_eq!(clamp_player_name("abcdefghi jk"), "abcdefghi");
        assert_eq!(clamp_player_name(""), "");
    }

    #[test]
    fn test_format_seconds() {
        let time = Duration::from_millis(2345);
        assert_eq!(format_seconds(time, 6), "2.345000");
        assert_eq!(format_seconds(time, 4), "2.3450");
    }
}
