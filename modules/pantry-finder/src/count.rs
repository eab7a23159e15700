/// Approximate a count for display so large numbers read as ballparks.
///
/// 7 → "7", 42 → "40+", 383 → "350+".
pub fn approximate_count(count: usize) -> String {
    if count < 10 {
        return count.to_string();
    }
    let step = if count < 100 { 10 } else { 50 };
    format!("{}+", count / step * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_below_ten() {
        assert_eq!(approximate_count(0), "0");
        assert_eq!(approximate_count(9), "9");
    }

    #[test]
    fn tens_below_one_hundred() {
        assert_eq!(approximate_count(10), "10+");
        assert_eq!(approximate_count(42), "40+");
        assert_eq!(approximate_count(99), "90+");
    }

    #[test]
    fn fifties_from_one_hundred() {
        assert_eq!(approximate_count(100), "100+");
        assert_eq!(approximate_count(149), "100+");
        assert_eq!(approximate_count(359), "350+");
        assert_eq!(approximate_count(383), "350+");
    }
}
