pub mod brief;
pub mod cache;
pub mod demo;
pub mod run;
