pub mod background;
pub mod deal;
pub mod generator;
pub mod input;
pub mod interactions;
pub mod labels;
pub mod profiles;
pub mod save;
pub mod settings;
pub mod sync;
pub mod tween;

pub use background::*;
pub use deal::*;
pub use generator::*;
pub use input::*;
pub use interactions::*;
pub use labels::*;
pub use profiles::*;
pub use save::*;
pub use settings::*;
pub use sync::*;
pub use tween::*;
