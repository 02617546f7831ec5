pub mod porur_env;
