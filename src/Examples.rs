/// estimation of reaction energies on the compound library in data/
pub mod gibbs_examples;
