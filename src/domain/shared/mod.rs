pub mod usage_dto;
