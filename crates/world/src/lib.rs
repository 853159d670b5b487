mod achievement;
mod armor;
mod biome;
mod building;
mod chunk;
mod combat;
mod crafting;
mod drop_item;
mod furnace;
mod geometry;
mod inventory;
mod mob;
mod persist;
mod player;
mod projectile;
mod resource;
mod services;
mod slot_click;
mod time;
mod world;

pub use achievement::*;
pub use armor::*;
pub use biome::*;
pub use building::*;
pub use chunk::*;
pub use combat::*;
pub use crafting::*;
pub use drop_item::*;
pub use furnace::*;
pub use geometry::*;
pub use inventory::*;
pub use mob::*;
pub use persist::*;
pub use player::*;
pub use projectile::*;
pub use resource::*;
pub use services::*;
pub use slot_click::*;
pub use time::*;
pub use world::*;
