pub mod yale;
