pub mod u101_upload_orders;
