pub mod upload_response;
