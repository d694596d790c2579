pub mod escalation;
pub mod notices;
pub mod restriction;
pub mod strike_service;
