//! Statistical hypothesis testing for pairwise similarity.


pub use permutation::{
    null_distribution, permutation_p_value, test_sorensen_permutation, PairResult,
    PermutationConfig, PermutationResults,
};
