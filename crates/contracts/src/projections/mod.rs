pub mod p101_fuel_sales;
