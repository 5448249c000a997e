mod snowflake;
pub use snowflake::Snowflake;

mod image_hash;
pub use image_hash::ImageHash;

pub mod channel;
pub mod guild;
pub mod interaction;
pub mod user;

mod util;
