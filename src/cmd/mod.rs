/// Animation decode command.
pub mod anim;
/// Archive extraction command.
pub mod extract;
/// Archive listing command.
pub mod info;
/// Texture decode command.
pub mod texture;
/// Shared CLI helpers.
pub mod util;
