/// Championship points by finishing position, top ten score.
pub fn points_for_position(position: i64) -> i64 {
    match position {
        1 => 25,
        2 => 18,
        3 => 15,
        4 => 12,
        5 => 10,
        6 => 8,
        7 => 6,
        8 => 4,
        9 => 2,
        10 => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_ten_score() {
        assert_eq!(points_for_position(1), 25);
        assert_eq!(points_for_position(10), 1);
        assert_eq!(points_for_position(11), 0);
        assert_eq!(points_for_position(999), 0);
    }
}
