pub mod broadcast_test;
