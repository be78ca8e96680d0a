pub mod postgres_test;
