use hackboard::setup;
use log::info;

fn main() {
    setup::setup_dotenv();
    env_logger::init();

    let connection = setup::establish_connection();
    setup::run_migrations(&connection).expect("Couldn't run migrations");
    setup::setup_roles(&connection);
    setup::setup_admin(&connection);

    info!("Database ready");
}
