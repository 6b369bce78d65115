use serenity::all::{Colour, CreateEmbed};

/// Error color - Rose red
pub const ERROR_COLOR: Colour = Colour::from_rgb(244, 63, 94);

/// Star reaction used for votes in favour
pub const VOTE_FOR: char = '⭐';

/// Cross reaction used for votes against
pub const VOTE_AGAINST: char = '❌';

/// Create an error embed
pub fn error_embed() -> CreateEmbed {
    CreateEmbed::new().color(ERROR_COLOR)
}
