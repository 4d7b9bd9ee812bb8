pub mod counter;
pub mod exti;
