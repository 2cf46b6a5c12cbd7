pub mod lightcycle;
