//! Cosine similarity over dense embedding vectors.

/// Cosine similarity of `a` and `b`.
///
/// Degenerate input (length mismatch, empty vectors, zero magnitude) scores 0
/// instead of failing, so one bad vector cannot abort a ranking pass.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
   if a.len() != b.len() || a.is_empty() {
      return 0.0;
   }

   let mut dot = 0.0f64;
   let mut norm_a = 0.0f64;
   let mut norm_b = 0.0f64;

   for (&x, &y) in a.iter().zip(b) {
      let (x, y) = (f64::from(x), f64::from(y));
      dot = x.mul_add(y, dot);
      norm_a = x.mul_add(x, norm_a);
      norm_b = y.mul_add(y, norm_b);
   }

   let denominator = norm_a.sqrt() * norm_b.sqrt();
   if denominator == 0.0 || !denominator.is_finite() {
      return 0.0;
   }

   let score = dot / denominator;
   if score.is_nan() { 0.0 } else { score as f32 }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn identical_vectors_score_one() {
      for v in [vec![1.0, 2.0, 3.0], vec![-0.3, 0.0, 7.5, 1e-3], vec![42.0]] {
         assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
      }
   }

   #[test]
   fn scaled_vector_scores_one() {
      let a = [0.2, -0.4, 0.9];
      let b = [0.6, -1.2, 2.7];
      assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
   }

   #[test]
   fn opposite_and_orthogonal() {
      assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
      assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
   }

   #[test]
   fn length_mismatch_scores_zero() {
      assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
      assert_eq!(cosine_similarity(&[1.0], &[]), 0.0);
   }

   #[test]
   fn empty_scores_zero() {
      assert_eq!(cosine_similarity(&[], &[]), 0.0);
   }

   #[test]
   fn zero_vector_scores_zero() {
      let zero = [0.0, 0.0, 0.0];
      assert_eq!(cosine_similarity(&zero, &[1.0, 2.0, 3.0]), 0.0);
      assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &zero), 0.0);
      assert_eq!(cosine_similarity(&zero, &zero), 0.0);
   }

   #[test]
   fn non_finite_components_score_zero() {
      assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
      assert_eq!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
   }
}
