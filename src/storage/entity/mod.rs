pub mod category;
pub mod city;
pub mod game;
pub mod league;
pub mod referee;
pub mod stadium;
pub mod team;
