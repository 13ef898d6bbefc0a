//! Общие DTO между HTTP-слоем и клиентами сервиса.

pub mod usecases;
