pub mod adc_board;
pub mod panel;
pub mod shared_bus;
pub mod speaker;
pub mod switch;
