pub mod bitboard;
pub mod board;
pub mod game;
pub mod move_gen;
pub mod perft;
pub mod piece;
pub mod position;
pub mod rules;
