mod config;
mod controller;
mod render;
