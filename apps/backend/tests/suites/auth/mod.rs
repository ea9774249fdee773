mod gate;
mod login;
mod password;
