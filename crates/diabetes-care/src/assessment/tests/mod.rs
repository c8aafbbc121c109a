mod common;
mod controller;
mod presenter;
