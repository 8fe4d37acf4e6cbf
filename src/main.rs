#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    advocate_dashboard_lib::run().await
}
