pub mod blow;
pub mod color;
pub mod constants;
pub mod fireworks;
pub mod paint;
pub mod scene;
pub mod show;
pub mod surface;
pub mod trail;

pub use blow::*;
pub use color::*;
pub use fireworks::*;
pub use paint::*;
pub use scene::*;
pub use show::*;
pub use surface::*;
