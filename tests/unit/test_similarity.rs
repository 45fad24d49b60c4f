use ragctx::rag::cosine_similarity;

#[test]
fn test_self_similarity_is_one() {
    let v: Vec<f32> = (1..=768).map(|i| (i as f32).sin()).collect();
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
}

#[test]
fn test_scale_invariant() {
    let a = [1.0, 2.0, 3.0];
    let b = [10.0, 20.0, 30.0];
    assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
}

#[test]
fn test_symmetric() {
    let a = [0.2, -0.7, 0.1];
    let b = [0.9, 0.3, -0.4];
    assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
}

#[test]
fn test_degenerate_inputs_score_zero() {
    assert_eq!(cosine_similarity(&[0.0; 3], &[0.0; 3]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
}
