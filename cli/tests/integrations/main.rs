mod check;
mod eval;
mod interactive;
mod run;
