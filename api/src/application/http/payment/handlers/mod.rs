pub mod grant_lifetime;
pub mod grant_trial;
