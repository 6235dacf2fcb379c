//! Synthetic training corpus: random benign path-like strings followed by a
//! short tail of known attack payloads.

use crate::error::Result;
use crate::features::{extract_features, FEATURE_COUNT};
use ndarray::Array2;
use rand::Rng;

pub const BENIGN_SAMPLES: usize = 2000;

pub const BENIGN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789/._-";

pub const KNOWN_ATTACKS: [&str; 7] = [
    "' OR 1=1 --",
    "<script>alert(1)</script>",
    "../../etc/passwd",
    "exec('id')",
    "UNION SELECT NULL,NULL--",
    "<img src=x onerror=alert(1)>",
    "admin'--",
];

pub fn random_benign_payload<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(5..100);
    (0..len)
        .map(|_| BENIGN_ALPHABET[rng.gen_range(0..BENIGN_ALPHABET.len())] as char)
        .collect()
}

/// Builds the `(BENIGN_SAMPLES + KNOWN_ATTACKS.len()) x FEATURE_COUNT` matrix.
pub fn generate_corpus<R: Rng>(rng: &mut R) -> Result<Array2<f64>> {
    let benign = (0..BENIGN_SAMPLES).map(|_| random_benign_payload(rng));
    let attacks = KNOWN_ATTACKS.iter().map(|a| a.to_string());

    let rows: Vec<f64> = benign
        .chain(attacks)
        .flat_map(|payload| extract_features(&payload).to_array())
        .collect();

    let n = rows.len() / FEATURE_COUNT;
    Ok(Array2::from_shape_vec((n, FEATURE_COUNT), rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_corpus_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let corpus = generate_corpus(&mut rng).unwrap();
        assert_eq!(corpus.dim(), (2007, 6));
    }

    #[test]
    fn test_attacks_are_the_tail() {
        let mut rng = StdRng::seed_from_u64(1);
        let corpus = generate_corpus(&mut rng).unwrap();
        let last = corpus.row(corpus.nrows() - 1).to_vec();
        assert_eq!(last, extract_features("admin'--").to_array().to_vec());
    }

    #[test]
    fn test_benign_payload_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let p = random_benign_payload(&mut rng);
            assert!((5..100).contains(&p.len()));
            assert!(p.bytes().all(|b| BENIGN_ALPHABET.contains(&b)));
        }
    }
}
