pub mod directory;
pub mod place_map;
pub mod ranking;
pub mod recommendations;
pub mod star_rating;
