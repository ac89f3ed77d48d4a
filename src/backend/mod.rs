pub mod spice;
