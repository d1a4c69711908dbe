pub mod angle;
pub mod animation;
pub mod assets;
pub mod catch;
pub mod deadline;
pub mod detector;
pub mod flight;
pub mod grind;
pub mod hands;
pub mod playtest;
pub mod rails;
pub mod rng;
pub mod settings;
pub mod sfx;
pub mod state;
pub mod tricks;
pub mod world;
