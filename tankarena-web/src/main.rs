#[macroquad::main("Tank Arena")]
async fn main() {
    tankarena_web_lib::run().await;
}
