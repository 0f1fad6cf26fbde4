pub mod error;
pub mod evaluation;
pub mod features;
pub mod kmeans;
pub mod model;
pub mod recommend;
pub mod scaler;
pub mod training;

pub use error::{ClusteringError, ClusteringResult};
pub use evaluation::{KEvaluation, best_k, evaluate};
pub use features::{FEATURE_NAMES, recipe_features};
pub use model::{ARTIFACT_VERSION, ClusterModel};
pub use recommend::{Preference, RankedRecipe, Recommendation, Recommender};
pub use scaler::StandardScaler;
pub use training::{TrainingOptions, train};
