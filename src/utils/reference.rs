// utils/reference.rs
use rand::distr::Alphanumeric;
use rand::Rng;

/// Human-readable reference attached to ledger entry notes, e.g. "EVF-7KQ2M9X4".
pub fn generate_reference() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..8)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_uppercase())
        .collect();
    format!("EVF-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_have_fixed_shape() {
        let r = generate_reference();
        assert!(r.starts_with("EVF-"));
        assert_eq!(r.len(), 12);
    }
}
