mod byte_order_tests;
mod georef_tests;
