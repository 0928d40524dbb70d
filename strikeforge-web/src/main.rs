use macroquad::prelude::Conf;

fn window_conf() -> Conf {
    Conf {
        window_title: "Strikeforge".to_owned(),
        window_width: 960,
        window_height: 720,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    strikeforge_web_lib::run().await;
}
