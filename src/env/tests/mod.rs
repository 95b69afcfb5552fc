pub mod helpers;
mod tests_mock_env;
