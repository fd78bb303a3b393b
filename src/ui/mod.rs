pub mod panels;
pub mod tabs;
