pub mod dto;
pub mod video_service;
