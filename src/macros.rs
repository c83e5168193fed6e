#[cfg(not(test))]
macro_rules! info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(test)]
macro_rules! info {
    ($($arg:tt)*) => {
        eprintln!($($arg)*)
    };
}

#[cfg(not(test))]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(test)]
macro_rules! debug {
    ($($arg:tt)*) => {
        eprintln!($($arg)*)
    };
}
